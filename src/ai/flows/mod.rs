// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Prompt flows, one module per practice feature.

pub mod accent;
pub mod audio;
pub mod compound_code;
pub mod impromptu;
pub mod phrase;
pub mod scramble;
pub mod story;
pub mod tone;
pub mod transcribe;
