use rand::Rng;

/// Policy deciding whether a proposed move that does not improve the energy
/// is accepted.
///
/// Moves that strictly decrease the energy are always accepted by the
/// [`Minimiser`](crate::Minimiser) and the policy is not consulted for them.
/// For all other moves the policy receives the energy of the proposal, the
/// energy of the current state and the control parameter (temperature or
/// threshold) of the running epoch. The control parameter is geometrically
/// cooled by the minimiser and set to zero in the final (quench) epoch, in
/// which the policy is not consulted at all.
///
/// The policy is shared by all minimisations running on the same
/// [`Minimiser`](crate::Minimiser) and therefore takes `&self`. All
/// randomness must be drawn from the passed generator.
///
/// ## Implementing a policy
///
/// Here is a "greedy with noise" policy which accepts a worse move with a
/// fixed probability, regardless of the control parameter.
///
/// ```rust
/// use recuit::Acceptance;
/// use rand::Rng;
///
/// struct Coin(f64);
///
/// impl Acceptance for Coin {
///     const NAME: &'static str = "Coin";
///
///     fn accept<R: Rng + ?Sized>(
///         &self,
///         _new: f64,
///         _current: f64,
///         _control: f64,
///         rng: &mut R,
///     ) -> bool {
///         rng.gen::<f64>() < self.0
///     }
/// }
/// ```
pub trait Acceptance: Send + Sync {
    /// Name of the policy.
    const NAME: &'static str;

    /// Decides whether the move to a state with energy `new` from a state
    /// with energy `current` is accepted, given `new >= current`.
    fn accept<R: Rng + ?Sized>(&self, new: f64, current: f64, control: f64, rng: &mut R)
        -> bool;
}
