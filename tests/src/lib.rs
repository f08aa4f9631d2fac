#![cfg(test)]

mod fixture;
mod pipeline;
mod repository;
