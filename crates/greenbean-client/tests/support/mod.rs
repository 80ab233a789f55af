#![allow(dead_code)]

pub mod extraction_stub;
