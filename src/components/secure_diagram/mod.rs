mod component;
mod connectors;
mod cycle;
mod dom;
mod error;
mod geometry;
mod lifecycle;
mod marker;
mod scheduler;
mod surface;
#[cfg(test)]
mod testing;
mod types;

pub use component::SecureArchitectureDiagram;
