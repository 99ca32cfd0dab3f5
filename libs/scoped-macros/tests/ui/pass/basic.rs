use scoped::{Scoped, ScopedJson};

#[derive(serde::Serialize, Scoped)]
pub struct Account {
    pub id: i64,
    #[scoped(scopes("admin"))]
    pub note: String,
    #[scoped(omit_empty, scopes = "user,admin")]
    pub email: String,
    #[scoped(skip)]
    pub password_hash: String,
}

fn main() {
    let account = Account {
        id: 1,
        note: String::new(),
        email: String::new(),
        password_hash: String::new(),
    };
    let _ = ScopedJson::new("admin", &account);
    let _ = ScopedJson::new("user", &vec![account]);
}
