pub mod secure_diagram;
