use chrono::{TimeZone, Utc};
use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_prune::{
    current_options, from_str, to_node, to_string, to_string_with_options, to_value, Document,
    Error, Node, Options, Purpose,
};

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct User {
    id: u32,
    name: String,
    active: bool,
    tags: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Profile {
    user: User,
    bio: Option<String>,
    links: Vec<String>,
}

#[test]
fn test_simple_struct() {
    let user = User {
        id: 123,
        name: "Alice".to_string(),
        active: true,
        tags: vec!["admin".to_string(), "developer".to_string()],
    };

    let text = to_string(&user).unwrap().unwrap();
    assert_eq!(
        text,
        r#"{"id":123,"name":"Alice","active":true,"tags":["admin","developer"]}"#
    );

    let back: User = from_str(&text).unwrap();
    assert_eq!(user, back);
}

#[test]
fn test_scalar_renderings() {
    assert_eq!(to_string(&42).unwrap().as_deref(), Some("42"));
    assert_eq!(to_string(&true).unwrap().as_deref(), Some("true"));
    assert_eq!(
        to_string("He said \"hi\"").unwrap().as_deref(),
        Some(r#""He said \"hi\"""#)
    );
}

#[test]
fn test_canceled_fields_vanish() {
    let profile = Profile {
        user: User {
            id: 1,
            name: "Bo".to_string(),
            active: false,
            tags: vec!["x".to_string()],
        },
        bio: None,
        links: Vec::new(),
    };

    let text = to_string(&profile).unwrap().unwrap();
    // Neither a "bio" nor a "links" key, and no null placeholders.
    assert!(!text.contains("bio"));
    assert!(!text.contains("links"));
    assert!(!text.contains("null"));

    let value = to_value(&profile).unwrap().unwrap();
    let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["user"]);
}

#[test]
fn test_cancelation_cascades_to_root() {
    #[derive(Serialize)]
    struct Inner {
        gone: Option<String>,
    }

    #[derive(Serialize)]
    struct Outer {
        a: Vec<i32>,
        b: Inner,
        c: std::collections::BTreeMap<String, Inner>,
    }

    let mut c = std::collections::BTreeMap::new();
    c.insert("k".to_string(), Inner { gone: None });
    let outer = Outer {
        a: Vec::new(),
        b: Inner { gone: None },
        c,
    };

    assert_eq!(to_string(&outer).unwrap(), None);
    assert_eq!(to_value(&outer).unwrap(), None);
    assert!(!to_node(&outer).unwrap().is_resolved());
}

#[test]
fn test_explicit_null_survives() {
    #[derive(Serialize)]
    struct WithNull {
        present: serde_json::Value,
    }

    let text = to_string(&WithNull {
        present: serde_json::Value::Null,
    })
    .unwrap()
    .unwrap();
    assert_eq!(text, r#"{"present":null}"#);
}

#[test]
fn test_canceled_array_elements_close_up() {
    let items = vec![Some(1), None, Some(3), None];
    assert_eq!(to_string(&items).unwrap().as_deref(), Some("[1,3]"));
}

#[test]
fn test_timestamp_encodes_as_iso8601_string() {
    let stamp = Utc.with_ymd_and_hms(2020, 4, 12, 22, 10, 57).unwrap();
    let ours = to_string(&stamp).unwrap().unwrap();
    // chrono drives the rendering either way, so the two emitters agree.
    assert_eq!(ours, serde_json::to_string(&stamp).unwrap());
    assert!(ours.starts_with("\"2020-04-12T22:10:57"));

    // A string scalar, not a structural object.
    let node = to_node(&stamp).unwrap();
    assert!(node.as_str().is_some());
}

#[test]
fn test_bytes_encode_as_base64_string() {
    struct Payload(Vec<u8>);

    impl Serialize for Payload {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_bytes(&self.0)
        }
    }

    let text = to_string(&Payload(vec![0xde, 0xad, 0xbe, 0xef]))
        .unwrap()
        .unwrap();
    assert_eq!(text, "\"3q2+7w==\"");
}

#[test]
fn test_enum_representations() {
    #[derive(Serialize)]
    enum Event {
        Ping,
        Named(String),
        Moved { x: i32, y: i32 },
    }

    assert_eq!(to_string(&Event::Ping).unwrap().as_deref(), Some("\"Ping\""));
    assert_eq!(
        to_string(&Event::Named("a".to_string())).unwrap().as_deref(),
        Some(r#"{"Named":"a"}"#)
    );
    assert_eq!(
        to_string(&Event::Moved { x: 1, y: 2 }).unwrap().as_deref(),
        Some(r#"{"Moved":{"x":1,"y":2}}"#)
    );
}

#[test]
fn test_enum_variant_with_canceled_payload_cancels() {
    #[derive(Serialize)]
    enum Event {
        Named(Option<String>),
    }

    assert_eq!(to_string(&Event::Named(None)).unwrap(), None);
}

#[test]
fn test_non_string_map_keys_are_rejected() {
    let mut map = std::collections::BTreeMap::new();
    map.insert(5i32, "five");
    assert!(matches!(
        to_string(&map),
        Err(Error::NonStringKey("signed integer"))
    ));
}

#[test]
fn test_double_write_protection_on_nodes() {
    let mut node = Node::new();
    node.set(Node::Int(1)).unwrap();
    assert!(matches!(
        node.set(Node::Bool(true)),
        Err(Error::InvalidEncodingState { .. })
    ));
    assert!(matches!(
        node.push(Node::Int(2)),
        Err(Error::InvalidEncodingState { .. })
    ));
    assert!(matches!(
        node.insert("k", Node::Int(2)),
        Err(Error::InvalidEncodingState { .. })
    ));
}

#[test]
fn test_purpose_reaches_collaborators() {
    struct Credentials {
        user: String,
        secret: String,
    }

    impl Serialize for Credentials {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let persisting =
                current_options(|o| o.purpose == Purpose::SaveLocally).unwrap_or(false);
            let mut state = serializer.serialize_struct("Credentials", 2)?;
            state.serialize_field("user", &self.user)?;
            if persisting {
                state.serialize_field("secret", &self.secret)?;
            }
            state.end()
        }
    }

    let creds = Credentials {
        user: "alice".to_string(),
        secret: "hunter2".to_string(),
    };

    let local = to_string(&creds).unwrap().unwrap();
    assert!(local.contains("secret"));

    let wire = to_string_with_options(&creds, Options::new().with_purpose(Purpose::Transfer))
        .unwrap()
        .unwrap();
    assert_eq!(wire, r#"{"user":"alice"}"#);
}

#[test]
fn test_user_info_reaches_collaborators() {
    struct Tagged;

    impl Serialize for Tagged {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let tenant = current_options(|o| o.user_info.get("tenant").cloned())
                .flatten()
                .and_then(|v| v.as_str().map(String::from))
                .unwrap_or_default();
            let mut state = serializer.serialize_struct("Tagged", 1)?;
            state.serialize_field("tenant", &tenant)?;
            state.end()
        }
    }

    let text = to_string_with_options(
        &Tagged,
        Options::new().with_user_info("tenant", json!("acme")),
    )
    .unwrap()
    .unwrap();
    assert_eq!(text, r#"{"tenant":"acme"}"#);
}

#[test]
fn test_document_round_trip() {
    let user = User {
        id: 9,
        name: "Cleo".to_string(),
        active: true,
        tags: vec!["ops".to_string()],
    };

    let doc = Document::from_encodable(&user).unwrap().unwrap();
    assert_eq!(doc.object()["name"], json!("Cleo"));

    let back: User = doc.decode().unwrap();
    assert_eq!(user, back);
}

#[test]
fn test_document_from_canceled_value_is_none() {
    assert_eq!(Document::from_encodable(&Option::<i32>::None).unwrap(), None);
}

#[test]
fn test_malformed_input_reports_parse_error() {
    let result: Result<serde_json::Value, Error> = from_str("{\"a\": [1, 2");
    assert!(matches!(result, Err(Error::Parse(_))));
}

#[test]
fn test_map_key_order_is_preserved() {
    let value: serde_json::Value = from_str(r#"{"z":1,"a":2,"m":3}"#).unwrap();
    let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["z", "a", "m"]);
}
