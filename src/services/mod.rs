// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod account;
pub mod firebase_auth;
pub mod payment;
pub mod razorpay;

pub use firebase_auth::{FirebaseTokenVerifier, FirebaseUser};
pub use razorpay::{PaymentDetails, PaymentGateway, RazorpayClient};
