pub mod corpus;
pub mod frontier;
pub mod web;

#[cfg(test)]
pub(crate) mod tests;
