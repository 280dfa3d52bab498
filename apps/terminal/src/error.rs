//! # Application Error Type
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Menu action                                                            │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  Result<_, AppError>                                                    │
//! │      │                                                                  │
//! │      ├── Core / InvalidInput ──► user_message() printed, back to menu   │
//! │      │                                                                  │
//! │      └── Io ───────────────────► session ends (stdin/stdout gone)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use cafe_core::CoreError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by the terminal app.
#[derive(Debug, Error)]
pub enum AppError {
    /// Business rule failure from cafe-core.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Text the operator typed could not be understood.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Reading stdin or writing stdout failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Creates an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        AppError::InvalidInput(message.into())
    }

    /// Whether the session can carry on after showing this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, AppError::Core(_) | AppError::InvalidInput(_))
    }

    /// One line shown to the operator.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Core(CoreError::NotFound { .. }) => "❌ Produto não encontrado.".to_string(),
            AppError::Core(CoreError::InvalidQuantity { .. }) => {
                "❌ Quantidade inválida.".to_string()
            }
            AppError::Core(CoreError::InvalidAmount { reason }) => {
                format!("❌ Valor inválido ({reason}).")
            }
            AppError::Core(CoreError::EmptyOrder) => {
                "⚠️ Nenhum item no pedido. Adicione itens antes de gerar a nota.".to_string()
            }
            AppError::Core(CoreError::Validation(e)) => format!("❌ {e}"),
            AppError::InvalidInput(message) => format!("❌ {message}"),
            AppError::Config(e) => format!("❌ {e}"),
            AppError::Io(e) => format!("❌ Erro de entrada/saída: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        let err = AppError::from(CoreError::NotFound { index: 3, len: 2 });
        assert_eq!(err.user_message(), "❌ Produto não encontrado.");
        assert!(err.is_recoverable());

        let err = AppError::from(CoreError::InvalidQuantity { quantity: 0 });
        assert_eq!(err.user_message(), "❌ Quantidade inválida.");

        let err = AppError::invalid_input("Opção inválida!");
        assert_eq!(err.user_message(), "❌ Opção inválida!");
    }

    #[test]
    fn test_io_is_not_recoverable() {
        let err = AppError::from(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"));
        assert!(!err.is_recoverable());
    }
}
