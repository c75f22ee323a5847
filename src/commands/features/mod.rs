pub(super) mod docker;
pub(super) mod live;
pub(super) mod power;
pub(super) mod services;
pub(super) mod status;
pub(super) mod system_info;
