// Pipeline modules and shared errors/models
pub mod coordinates {
    pub use crate::coordinates::*;
}

pub mod extractor {
    pub use crate::extractor::*;
}

pub mod enrichment {
    pub use crate::enrichment::*;
}

pub mod models {
    pub use crate::models::*;
}

pub mod errors {
    pub use crate::errors::*;
}
