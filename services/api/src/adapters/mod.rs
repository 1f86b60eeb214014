pub mod image_gen;
pub mod payment;
pub mod placeholder;
pub mod storage;
pub mod wallet;

pub use image_gen::OpenAiImageAdapter;
pub use payment::HttpPaymentAdapter;
pub use storage::FileStateStore;
pub use wallet::{Wallet, WalletHandle, WalletState};
