use crate::resolve::TargetResolver;

pub struct AppState {
    pub resolver: TargetResolver,
    /// Used when a request carries no `lat` parameter.
    pub circumpolar_latitude: f64,
}
