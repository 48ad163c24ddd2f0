use feedgate::models::{ApiUser, UserEnvelope};

#[test]
fn test_me_payload_deserializes_capitalized_fields() {
    // The backend serializes Go structs: capitalized keys, extra fields the
    // client never reads.
    let payload = r#"{
        "data": {
            "ID": 7,
            "Username": "alice",
            "Name": "Alice",
            "Email": "alice@example.com",
            "FollowersCount": 3
        }
    }"#;

    let envelope: UserEnvelope = serde_json::from_str(payload).unwrap();
    assert_eq!(envelope.data.id, 7);
    assert_eq!(envelope.data.username, "alice");
}

#[test]
fn test_api_user_serializes_with_wire_names() {
    let user = ApiUser {
        id: 7,
        username: "alice".to_string(),
    };

    let value = serde_json::to_value(&user).unwrap();
    assert_eq!(value["ID"], 7);
    assert_eq!(value["Username"], "alice");
}
