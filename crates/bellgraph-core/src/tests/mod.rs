mod graph_tests;
mod property_tests;
