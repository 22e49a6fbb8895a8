// Domain layer - pure models and closed-form math
pub mod dashboard;
pub mod figure;
pub mod geo;
pub mod stats;
