pub mod route_query;

pub use route_query::{KeywordRouter, QueryKind, RoutingDecision};
