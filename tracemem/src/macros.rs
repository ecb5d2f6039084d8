/// Builds a [`ToolNames`](crate::ToolNames) override map from kind shorthands.
///
/// ```rust
/// use tracemem::{ToolKind, tm_tool_names};
///
/// let names = tm_tool_names! {
///     Open => "startTask",
///     Close => "finishTask",
/// };
///
/// assert_eq!(names.resolve(ToolKind::Open), "startTask");
/// assert_eq!(names.resolve(ToolKind::Note), "tracememNote");
/// ```
#[macro_export]
macro_rules! tm_tool_names {
    () => {
        $crate::ToolNames::new()
    };
    ($($kind:ident => $name:expr),+ $(,)?) => {
        $crate::ToolNames::new()$(.with($crate::ToolKind::$kind, $name))+
    };
}

/// Builds a [`RequestContext`](crate::RequestContext) from `key: value` pairs.
///
/// Keys are written as they appear on the wire, so `userId` stays camelCase.
///
/// ```rust
/// use serde_json::json;
/// use tracemem::tm_context;
///
/// let context = tm_context! { route: "/api/refunds", userId: "u1" };
/// assert_eq!(context.field("userId"), Some(&json!("u1")));
/// ```
#[macro_export]
macro_rules! tm_context {
    () => {
        $crate::RequestContext::new()
    };
    ($($key:ident : $value:expr),+ $(,)?) => {
        $crate::RequestContext::new()$(.with_field(stringify!($key), $value))+
    };
}
