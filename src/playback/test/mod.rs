pub(crate) mod mock;

mod lifecycle;
