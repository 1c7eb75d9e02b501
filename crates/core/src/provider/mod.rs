pub mod llm;
mod openai;
mod openai_types;
