mod runner;
mod support;
