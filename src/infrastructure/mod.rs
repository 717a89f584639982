pub mod cdp_page;
pub mod driver;
pub mod js_executor;

pub use cdp_page::CdpPage;
pub use driver::{AttrMatch, AttrPattern, ControlKind, ElementHandle, FormPage, PageSnapshot, Query, Role};
pub use js_executor::JsExecutor;
