/// Marker for a model that is **not yet trained**.
///
/// Training entry points take `Model<Unfitted>`; inference methods are not
/// available in this state, so an untrained model cannot be used to price a
/// trip by accident.
#[derive(Clone, Copy, Debug)]
pub struct Unfitted;

/// Marker for a model that has been **fully trained**.
///
/// A `Model<Fitted>` carries only inference parameters (no optimizer state,
/// loss function or hyperparameters) and is what gets archived.
#[derive(Clone, Copy, Debug)]
pub struct Fitted;
