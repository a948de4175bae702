pub mod get_client_ip;
pub mod image_data;
pub mod markdown;
