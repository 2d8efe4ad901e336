pub mod token_data;
