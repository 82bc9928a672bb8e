/// Receives the two end-of-game events, typically to play a sound or an animation.
///
/// The session only calls it while unmuted.
pub trait Feedback {
    fn on_win(&mut self);

    fn on_loss(&mut self);
}

/// Feedback that does nothing, used until a real collaborator is attached.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Silent;

impl Feedback for Silent {
    fn on_win(&mut self) {}

    fn on_loss(&mut self) {}
}
