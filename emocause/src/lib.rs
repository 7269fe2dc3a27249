//! Extraction of emotion holders and causes from annotated documents.
//!
//! Documents are sentences with tokens, constituency trees and
//! dependencies, plus coreference chains. Emotion triggers are found
//! with lexical patterns. The holder and cause of a trigger are
//! constituents found by navigating the tree from the trigger.

pub mod clause;

pub mod config;

mod constants;

pub mod coref;

pub mod dependency;

pub mod document;

pub mod error;

pub mod extract;

pub mod normalize;

pub mod pattern;

pub mod token;

pub mod tree;
