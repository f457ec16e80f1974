//! Wire types shared by handlers and the account workflow.

pub mod accounts;

pub use accounts::{
    AccountProfile, AccountRecord, AddUserParams, LoginRequest, LoginResponse, MessageResponse,
    RegisterRequest,
};
