//! JDK discovery and validation: a minimal `JavaLocator` black box. Given a
//! required Java SE major version and an optional vendor hint, finds an
//! already-installed JDK's home directory. Provisioning (downloading and
//! caching JDK distributions) is explicitly out of scope.

pub mod locate;
