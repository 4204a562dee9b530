// trait implemented where subscriptions and pending timers form Rc cycles that
// will not be auto-cleaned; destroy() must leave no callback able to fire
pub trait Destroyable {
    fn destroy(&mut self);
}
