use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("thunk dispatched without the deferred-dispatch middleware installed")]
    UnhandledThunk,

    #[error("bootstrap dispatch did not commit an initial state")]
    BootstrapSkipped,
}
