// 領域層：核心模型、埠（介面）與地理編碼回退流程

pub mod model;
pub mod ports;

pub mod services;
