pub mod sizing;
