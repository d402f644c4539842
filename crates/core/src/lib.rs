pub mod capture;
pub mod classification;
pub mod notification;
pub mod recognition;
pub mod shared;
pub mod storage;
