pub mod grouper;
pub mod parser;
pub mod pipeline;
pub mod probe;
pub mod report;
pub mod scheduler;
