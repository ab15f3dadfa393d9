// 轉接層：外部系統（http、儲存）的具體實作

pub mod http;
pub mod storage;

pub use http::AdresseApiClient;
pub use storage::LocalStorage;
