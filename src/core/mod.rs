pub mod dialogue;
pub mod fragment;
pub mod journal;
pub mod language;
pub mod lock;
pub mod retelling;
pub mod session;
pub mod settings;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod thought;
pub mod typewriter;
pub mod view;
