//! COM+ catalog interfaces (MS-COMA)

pub mod icatalogutils;
