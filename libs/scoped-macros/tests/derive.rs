#![allow(clippy::unwrap_used, clippy::expect_used)]

use scoped::{AsRecord, FieldSpec, ScopedRecord, Scoped, project};
use serde::Serialize;
use serde_json::json;

#[derive(Serialize, Scoped)]
#[allow(dead_code)]
struct Example {
    id: i64,
    #[scoped(scopes("admin"))]
    admin_only: String,
    #[scoped(omit_empty, scopes("user"))]
    user_only: String,
    #[scoped(omit_empty, scopes("user", "admin"))]
    both: String,
    #[serde(skip)]
    hidden: String,
    #[scoped(omit_empty)]
    all: String,
}

#[derive(Serialize, Scoped)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
struct Profile {
    display_name: String,
    #[serde(rename = "mail")]
    #[scoped(scopes = "owner,admin")]
    email_address: String,
    #[scoped(rename = "avatar")]
    avatar_url: String,
    #[scoped(skip)]
    password_hash: String,
    r#type: u8,
}

// Hidden fields need not be serializable.
struct Opaque;

#[derive(Serialize, Scoped)]
#[allow(dead_code)]
struct WithOpaque {
    id: u32,
    #[serde(skip)]
    handle: Opaque,
}

#[derive(Serialize, Scoped)]
struct Page<T> {
    #[scoped(omit_empty)]
    items: Vec<T>,
    #[scoped(scopes("admin"))]
    total: u64,
}

#[derive(Default, Serialize, Scoped)]
#[serde(rename_all = "snake_case")]
#[allow(non_snake_case)]
struct SnakeKeys {
    _lead: u8,
    x__y: u8,
    userID: u8,
}

#[derive(Default, Serialize, Scoped)]
#[serde(rename_all = "camelCase")]
#[allow(non_snake_case)]
struct CamelKeys {
    _lead: u8,
    x__y: u8,
    userID: u8,
    plain_name: u8,
}

#[derive(Default, Serialize, Scoped)]
#[serde(rename_all = "kebab-case")]
#[allow(non_snake_case)]
struct KebabKeys {
    _lead: u8,
    x__y: u8,
    userID: u8,
}

#[derive(Default, Serialize, Scoped)]
#[serde(rename_all = "SCREAMING-KEBAB-CASE")]
#[allow(non_snake_case)]
struct ScreamingKeys {
    _lead: u8,
    x__y: u8,
    userID: u8,
}

fn upper<S: serde::Serializer>(value: &str, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_uppercase())
}

mod as_text {
    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: serde::Serializer>(value: &u32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }
}

#[derive(Serialize, Scoped)]
struct Custom {
    #[serde(serialize_with = "upper")]
    name: String,
    #[serde(with = "as_text")]
    #[scoped(scopes("admin"))]
    count: u32,
}

fn keys<T: Serialize + AsRecord>(value: &T) -> (Vec<String>, Vec<String>) {
    let serde_keys = serde_json::to_value(value)
        .unwrap()
        .as_object()
        .unwrap()
        .keys()
        .cloned()
        .collect();
    let projected = project(value, "any").unwrap().keys().cloned().collect();
    (serde_keys, projected)
}

#[test]
fn descriptor_table_follows_declaration_order() {
    let specs = Example::field_specs();
    assert_eq!(specs.len(), 6);
    assert_eq!(specs[0], FieldSpec::new("id", "id"));
    assert_eq!(specs[1], FieldSpec::new("admin_only", "admin_only").scopes(&["admin"]));
    assert_eq!(
        specs[2],
        FieldSpec::new("user_only", "user_only")
            .omit_empty()
            .scopes(&["user"])
    );
    assert_eq!(specs[3].visibility(), &["user", "admin"]);
    assert_eq!(specs[4], FieldSpec::hidden("hidden"));
    assert!(specs[5].is_omit_empty());
    assert!(specs[5].visibility().is_empty());
}

#[test]
fn keys_follow_serde_renames() {
    let keys: Vec<_> = Profile::field_specs()
        .iter()
        .map(FieldSpec::output_key)
        .collect();
    assert_eq!(
        keys,
        [
            Some("displayName"),
            Some("mail"),
            Some("avatar"),
            None,
            Some("type")
        ]
    );
    assert_eq!(Profile::field_specs()[1].visibility(), &["owner", "admin"]);
}

#[test]
fn projected_keys_match_serde_output_keys() {
    let profile = Profile {
        display_name: "Ann".to_owned(),
        email_address: "ann@example.com".to_owned(),
        avatar_url: "a.png".to_owned(),
        password_hash: "x".to_owned(),
        r#type: 1,
    };
    let view = project(&profile, "owner").unwrap();
    assert_eq!(
        serde_json::Value::Object(view),
        json!({
            "displayName": "Ann",
            "mail": "ann@example.com",
            "avatar": "a.png",
            "type": 1
        })
    );
}

#[test]
fn hidden_field_value_is_never_requested() {
    let rec = WithOpaque {
        id: 9,
        handle: Opaque,
    };
    assert!(rec.field_value(1).is_err());
    assert_eq!(rec.field_value(0).unwrap(), json!(9));
    assert_eq!(
        serde_json::Value::Object(project(&rec, "any").unwrap()),
        json!({"id": 9})
    );
}

#[test]
fn generic_records_project() {
    let page = Page {
        items: vec!["a", "b"],
        total: 2,
    };
    let view = project(&page, "user").unwrap();
    assert_eq!(serde_json::Value::Object(view), json!({"items": ["a", "b"]}));

    let empty: Page<u8> = Page {
        items: Vec::new(),
        total: 0,
    };
    let view = project(&empty, "admin").unwrap();
    assert_eq!(serde_json::Value::Object(view), json!({"total": 0}));
}

#[test]
fn rename_all_keys_match_serde_for_irregular_names() {
    let (serde_keys, projected) = keys(&SnakeKeys::default());
    assert_eq!(projected, serde_keys);
    assert_eq!(projected, ["_lead", "userID", "x__y"]);

    let (serde_keys, projected) = keys(&CamelKeys::default());
    assert_eq!(projected, serde_keys);
    assert_eq!(projected, ["lead", "plainName", "userID", "xY"]);

    let (serde_keys, projected) = keys(&KebabKeys::default());
    assert_eq!(projected, serde_keys);

    let (serde_keys, projected) = keys(&ScreamingKeys::default());
    assert_eq!(projected, serde_keys);
}

#[test]
fn custom_serializers_shape_projected_values() {
    let custom = Custom {
        name: "ada".to_owned(),
        count: 7,
    };
    let full = serde_json::to_value(&custom).unwrap();
    assert_eq!(full, json!({"name": "ADA", "count": "7"}));

    let admin = project(&custom, "admin").unwrap();
    assert_eq!(serde_json::Value::Object(admin), full);

    let user = project(&custom, "user").unwrap();
    assert_eq!(serde_json::Value::Object(user), json!({"name": "ADA"}));
}
