use scoped::Scoped;

#[derive(serde::Serialize, Scoped)]
pub struct Empty {}

#[derive(serde::Serialize, Scoped)]
pub struct Wrapper<'a, T> {
    pub label: &'a str,
    #[scoped(omit_empty)]
    pub inner: Option<T>,
}

fn main() {
    let _ = scoped::project(&Empty {}, "any");
    let wrapper = Wrapper {
        label: "x",
        inner: Some(3_u8),
    };
    let _ = scoped::project(&wrapper, "any");
}
