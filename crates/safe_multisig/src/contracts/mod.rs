pub mod allowance_module;
pub mod erc20;

pub use self::allowance_module::AllowanceModule;
pub use self::erc20::IERC20;
