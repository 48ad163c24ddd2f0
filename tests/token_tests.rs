use chrono::Utc;
use feedgate::token::{Claims, decode_credential, is_expired};
use jsonwebtoken::{EncodingKey, Header, encode};

// --- Helper Functions ---

const TEST_JWT_SECRET: &str = "test-secret-value-1234567890";

fn mint_token(user_id: i64, exp_offset: i64) -> String {
    let claims = Claims {
        user_id,
        exp: (Utc::now().timestamp() + exp_offset) as usize,
    };

    let key = EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes());
    encode(&Header::default(), &claims, &key).unwrap()
}

// --- Tests ---

#[test]
fn test_decode_returns_none_for_malformed_input() {
    // A spread of malformed shapes: empty, unstructured, too few sections,
    // sections that are not base64, and a payload that is not JSON.
    let malformed = [
        "",
        "garbage",
        "one.two",
        "!!!.???.###",
        "eyJhbGciOiJIUzI1NiJ9.bm90LWpzb24.sig",
    ];

    for token in malformed {
        assert!(
            decode_credential(token).is_none(),
            "expected no claims for {token:?}"
        );
        // A credential that cannot be decoded is always expired.
        assert!(is_expired(token), "expected {token:?} to count as expired");
    }
}

#[test]
fn test_decode_extracts_claims_without_a_secret() {
    let token = mint_token(42, 3600);

    // The client holds no signing secret; decoding must still surface the
    // claims.
    let claims = decode_credential(&token).expect("valid token should decode");
    assert_eq!(claims.user_id, 42);
}

#[test]
fn test_expiry_in_the_past_is_expired() {
    let token = mint_token(1, -3600);
    assert!(is_expired(&token));
}

#[test]
fn test_expiry_in_the_future_is_not_expired() {
    let token = mint_token(1, 3600);
    assert!(!is_expired(&token));
}

#[test]
fn test_expiry_comparison_is_strictly_before() {
    let claims = Claims {
        user_id: 1,
        exp: 1_000,
    };

    // Strictly before now counts as expired; equal to now does not.
    assert!(!claims.expired_at(999));
    assert!(!claims.expired_at(1_000));
    assert!(claims.expired_at(1_001));
}
