//! Backend worker hosting the async runtime the UI hands network and
//! animation work to.

pub mod runtime;
