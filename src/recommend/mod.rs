pub mod likes;
pub mod scoring;
pub mod similar;
