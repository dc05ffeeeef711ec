pub mod openai;
pub mod trait_impl;

pub use openai::OpenAIProvider;
pub use trait_impl::ChatProvider;
