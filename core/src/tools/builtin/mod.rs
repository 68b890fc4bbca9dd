//! Built-in tool implementations

pub mod current_time;
pub mod draw_image;
pub mod image_qa;
pub mod summarize_url;
pub mod weather;
pub mod web_search;

pub use current_time::CurrentTimeTool;
pub use draw_image::DrawImageTool;
pub use image_qa::ImageQaTool;
pub use summarize_url::SummarizeUrlTool;
pub use weather::WeatherTool;
pub use web_search::WebSearchTool;
