pub mod ask_ai;
pub mod chat_api_http;
pub mod diagnostics;
pub mod endpoint;
pub mod settings;
