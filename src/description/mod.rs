mod generator;
mod template;

pub use generator::DescriptionClient;
