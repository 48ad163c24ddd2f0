use std::collections::HashMap;
use thiserror::Error;

/// RouteError
///
/// Configuration errors raised while building the route table or resolving a
/// named route. Build-time variants are fatal at startup — a table that
/// redirects into nowhere is a programming error, not a runtime condition to
/// paper over.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("duplicate route name `{0}`")]
    DuplicateName(String),
    #[error("route `{route}` targets unknown route name `{target}`")]
    UnknownTarget { route: String, target: String },
    #[error("route `{route}` targets `{target}`, which expects parameters")]
    TargetNeedsParams { route: String, target: String },
    #[error("route `{route}` expects target `{target}` to expose a `:{param}` segment")]
    TargetMissingParam {
        route: String,
        target: String,
        param: String,
    },
    #[error("more than one catch-all route registered")]
    DuplicateCatchAll,
    #[error("no route named `{0}`")]
    UnknownName(String),
    #[error("missing parameter `{param}` for route `{route}`")]
    MissingParam { route: String, param: String },
}

/// RouteId — index of a node in the route arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RouteId(usize);

/// One segment of a route path: a literal to match verbatim, or a `:name`
/// parameter capturing whatever appears in that position.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// RedirectTarget
///
/// Where a redirecting route sends the navigation: a literal path, or a
/// named route resolved through the table's name registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectTarget {
    Path(String),
    Name(String),
}

/// RouteAction
///
/// What committing to a route means once the guard allows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteAction {
    /// Render the named view component. The component reference is opaque to
    /// this crate; rendering belongs to the view layer.
    View(String),
    /// Redirect to another route instead of rendering.
    Redirect(RedirectTarget),
}

/// EnterEffect
///
/// A side effect the guard executes when the navigation enters the route,
/// before any redirect or render is committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnterEffect {
    /// Delete the stored credential and drop the session. Carried by the
    /// logout pseudo-route.
    ClearCredential,
    /// Resolve the current identity over the network and rewrite the
    /// navigation to the named route, filling `param` with the resolved
    /// username. Carried by the bare profile shortcut.
    ResolveIdentity { target: String, param: String },
}

/// RouteDef
///
/// One declarative route entry, possibly nested. Definitions are plain data:
/// the table builder turns a forest of these into the arena and validates
/// every cross-reference before any navigation runs.
#[derive(Debug, Clone)]
pub struct RouteDef {
    path: String,
    name: Option<String>,
    action: Option<RouteAction>,
    requires_auth: bool,
    on_enter: Option<EnterEffect>,
    children: Vec<RouteDef>,
    catch_all: bool,
}

impl RouteDef {
    fn bare(path: &str) -> Self {
        Self {
            path: path.to_string(),
            name: None,
            action: None,
            requires_auth: false,
            on_enter: None,
            children: Vec::new(),
            catch_all: false,
        }
    }

    /// A route that renders a view component.
    pub fn view(path: &str, component: &str) -> Self {
        let mut def = Self::bare(path);
        def.action = Some(RouteAction::View(component.to_string()));
        def
    }

    /// A structural grouping route: matches nothing by itself, exists to
    /// nest children under a common path prefix (and to carry metadata they
    /// inherit).
    pub fn group(path: &str) -> Self {
        Self::bare(path)
    }

    /// A route that redirects to a named route.
    pub fn redirect_to_name(path: &str, target: &str) -> Self {
        let mut def = Self::bare(path);
        def.action = Some(RouteAction::Redirect(RedirectTarget::Name(
            target.to_string(),
        )));
        def
    }

    /// A route whose entry effect decides the outcome (no static action).
    pub fn effect(path: &str, effect: EnterEffect) -> Self {
        let mut def = Self::bare(path);
        def.on_enter = Some(effect);
        def
    }

    /// The catch-all entry: matches any path no other route matched and
    /// redirects to the given literal path.
    pub fn catch_all(target: &str) -> Self {
        let mut def = Self::bare("*");
        def.action = Some(RouteAction::Redirect(RedirectTarget::Path(
            target.to_string(),
        )));
        def.catch_all = true;
        def
    }

    /// Registers the route under a unique logical name, addressable through
    /// `url_for` and `RedirectTarget::Name`.
    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Flags the route (and, by inheritance, every descendant) as requiring
    /// an authenticated session.
    pub fn requires_auth(mut self) -> Self {
        self.requires_auth = true;
        self
    }

    /// Attaches an entry effect.
    pub fn on_enter(mut self, effect: EnterEffect) -> Self {
        self.on_enter = Some(effect);
        self
    }

    /// Appends a nested child. The child's path is relative to this route;
    /// an empty path places the child at the parent's own path.
    pub fn child(mut self, child: RouteDef) -> Self {
        self.children.push(child);
        self
    }
}

/// RouteNode
///
/// One entry in the built arena. Paths are stored as full segment lists from
/// the root, so matching never walks the tree; the parent/child indices exist
/// for chain reconstruction and metadata propagation.
#[derive(Debug)]
pub struct RouteNode {
    parent: Option<RouteId>,
    children: Vec<RouteId>,
    segments: Vec<Segment>,
    /// Full joined path, for diagnostics and reverse lookup.
    pub path: String,
    pub name: Option<String>,
    pub action: Option<RouteAction>,
    /// The flag as declared on this route.
    pub requires_auth: bool,
    /// The flag after ancestor propagation: true when this route or any
    /// ancestor declares it. This is what the guard consults.
    pub auth_required: bool,
    pub on_enter: Option<EnterEffect>,
}

/// RouteMatch
///
/// The resolved chain for a concrete path: the matched leaf, its ancestor
/// chain (root first), and any captured `:param` values. Captured once per
/// navigation and handed to the guard, which never re-reads ambient routing
/// state after a suspension point.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    pub chain: Vec<RouteId>,
    pub leaf: RouteId,
    pub params: HashMap<String, String>,
    /// True when the path only resolved through the catch-all entry.
    pub catch_all: bool,
}

/// RouteTable
///
/// The static routing structure, built once at startup from declarative
/// definitions. Invariant: every concrete path resolves to exactly one
/// matched chain — leaves are tried in registration order and the first hit
/// wins, with the catch-all entry absorbing everything else.
pub struct RouteTable {
    nodes: Vec<RouteNode>,
    by_name: HashMap<String, RouteId>,
    catch_all: Option<RouteId>,
}

impl RouteTable {
    /// build
    ///
    /// Flattens the definition forest into the arena, propagates
    /// `requires_auth` down each branch, registers names, and validates every
    /// redirect and entry-effect target. Any configuration error fails the
    /// build loudly; a table that constructs successfully cannot produce a
    /// dangling redirect at navigation time.
    pub fn build(defs: Vec<RouteDef>) -> Result<Self, RouteError> {
        let mut table = Self {
            nodes: Vec::new(),
            by_name: HashMap::new(),
            catch_all: None,
        };

        for def in defs {
            table.insert(def, None, false)?;
        }

        table.validate_targets()?;
        Ok(table)
    }

    fn insert(
        &mut self,
        def: RouteDef,
        parent: Option<RouteId>,
        inherited_auth: bool,
    ) -> Result<RouteId, RouteError> {
        let id = RouteId(self.nodes.len());

        if def.catch_all {
            if self.catch_all.is_some() {
                return Err(RouteError::DuplicateCatchAll);
            }
            self.catch_all = Some(id);
        }

        let mut segments = match parent {
            Some(pid) => self.nodes[pid.0].segments.clone(),
            None => Vec::new(),
        };
        for raw in split_path(&def.path) {
            segments.push(match raw.strip_prefix(':') {
                Some(param) => Segment::Param(param.to_string()),
                None => Segment::Literal(raw.to_string()),
            });
        }

        let path = join_segments(&segments);
        let auth_required = inherited_auth || def.requires_auth;

        if let Some(name) = &def.name {
            if self.by_name.insert(name.clone(), id).is_some() {
                return Err(RouteError::DuplicateName(name.clone()));
            }
        }

        self.nodes.push(RouteNode {
            parent,
            children: Vec::new(),
            segments,
            path,
            name: def.name,
            action: def.action,
            requires_auth: def.requires_auth,
            auth_required,
            on_enter: def.on_enter,
        });

        if let Some(pid) = parent {
            self.nodes[pid.0].children.push(id);
        }

        for child in def.children {
            self.insert(child, Some(id), auth_required)?;
        }

        Ok(id)
    }

    /// Checks every name reference recorded in the table. Runs after all
    /// inserts so declaration order never matters.
    fn validate_targets(&self) -> Result<(), RouteError> {
        for node in &self.nodes {
            if let Some(RouteAction::Redirect(RedirectTarget::Name(target))) = &node.action {
                let target_id = self.lookup_target(&node.path, target)?;
                if self
                    .node(target_id)
                    .segments
                    .iter()
                    .any(|s| matches!(s, Segment::Param(_)))
                {
                    return Err(RouteError::TargetNeedsParams {
                        route: node.path.clone(),
                        target: target.clone(),
                    });
                }
            }

            if let Some(EnterEffect::ResolveIdentity { target, param }) = &node.on_enter {
                let target_id = self.lookup_target(&node.path, target)?;
                let has_param = self
                    .node(target_id)
                    .segments
                    .iter()
                    .any(|s| matches!(s, Segment::Param(p) if p == param));
                if !has_param {
                    return Err(RouteError::TargetMissingParam {
                        route: node.path.clone(),
                        target: target.clone(),
                        param: param.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    fn lookup_target(&self, route: &str, target: &str) -> Result<RouteId, RouteError> {
        self.by_name
            .get(target)
            .copied()
            .ok_or_else(|| RouteError::UnknownTarget {
                route: route.to_string(),
                target: target.to_string(),
            })
    }

    pub fn node(&self, id: RouteId) -> &RouteNode {
        &self.nodes[id.0]
    }

    /// match_path
    ///
    /// Resolves a concrete path to its route chain. Leaves (routes with an
    /// action or entry effect and no children) are tried in registration
    /// order; the first whose full segment list matches wins. Unmatched paths
    /// fall through to the catch-all entry when one is registered.
    pub fn match_path(&self, raw: &str) -> Option<RouteMatch> {
        let target: Vec<&str> = split_path(raw).collect();

        for (index, node) in self.nodes.iter().enumerate() {
            let id = RouteId(index);
            if Some(id) == self.catch_all {
                continue;
            }
            if !self.is_leaf(node) {
                continue;
            }

            if let Some(params) = match_segments(&node.segments, &target) {
                return Some(RouteMatch {
                    chain: self.chain_of(id),
                    leaf: id,
                    params,
                    catch_all: false,
                });
            }
        }

        self.catch_all.map(|id| RouteMatch {
            chain: vec![id],
            leaf: id,
            params: HashMap::new(),
            catch_all: true,
        })
    }

    fn is_leaf(&self, node: &RouteNode) -> bool {
        node.children.is_empty() && (node.action.is_some() || node.on_enter.is_some())
    }

    fn chain_of(&self, id: RouteId) -> Vec<RouteId> {
        let mut chain = vec![id];
        let mut current = self.node(id).parent;
        while let Some(pid) = current {
            chain.push(pid);
            current = self.node(pid).parent;
        }
        chain.reverse();
        chain
    }

    /// url_for
    ///
    /// Reverse lookup: builds the concrete path for a named route,
    /// substituting `:param` segments from the given map. Unknown names and
    /// missing parameters are configuration errors.
    pub fn url_for(&self, name: &str, params: &[(&str, &str)]) -> Result<String, RouteError> {
        let id = self
            .by_name
            .get(name)
            .copied()
            .ok_or_else(|| RouteError::UnknownName(name.to_string()))?;
        let node = self.node(id);

        let mut parts = Vec::with_capacity(node.segments.len());
        for segment in &node.segments {
            match segment {
                Segment::Literal(lit) => parts.push(lit.as_str()),
                Segment::Param(param) => {
                    let value = params
                        .iter()
                        .find(|(key, _)| *key == param.as_str())
                        .map(|(_, value)| *value)
                        .ok_or_else(|| RouteError::MissingParam {
                            route: node.path.clone(),
                            param: param.clone(),
                        })?;
                    parts.push(value);
                }
            }
        }

        Ok(format!("/{}", parts.join("/")))
    }
}

/// Splits a raw path into non-empty segments, ignoring query and fragment
/// suffixes and trailing slashes. `/` and the empty string both yield no
/// segments.
fn split_path(raw: &str) -> impl Iterator<Item = &str> {
    let raw = raw
        .split(['?', '#'])
        .next()
        .unwrap_or_default();
    raw.split('/').filter(|s| !s.is_empty())
}

fn join_segments(segments: &[Segment]) -> String {
    let parts: Vec<String> = segments
        .iter()
        .map(|s| match s {
            Segment::Literal(lit) => lit.clone(),
            Segment::Param(param) => format!(":{param}"),
        })
        .collect();
    format!("/{}", parts.join("/"))
}

fn match_segments(pattern: &[Segment], target: &[&str]) -> Option<HashMap<String, String>> {
    if pattern.len() != target.len() {
        return None;
    }

    let mut params = HashMap::new();
    for (segment, concrete) in pattern.iter().zip(target) {
        match segment {
            Segment::Literal(lit) => {
                if lit != concrete {
                    return None;
                }
            }
            Segment::Param(param) => {
                params.insert(param.clone(), (*concrete).to_string());
            }
        }
    }
    Some(params)
}
