
mod evaluator;
mod operations;
