//! different utility modules used throughout the project
/// tiny module to save curves into a tab separated or csv file
pub mod logger;
/// pretty-printed table of a batch: status and value range of every formula
pub mod summary;
/// parse document with structure like " title1 key1: value1, value2 key2: value2 title2 key3:value3, value4" into HashMap
pub mod task_parser;
///
mod task_parser_tests;
