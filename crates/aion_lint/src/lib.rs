//! Lint rules and engine for static analysis of HDL designs.
//!
//! This crate implements warning, error, and convention lint rules that operate
//! on the AionIR to detect common design mistakes and enforce coding standards.

#![warn(missing_docs)]
