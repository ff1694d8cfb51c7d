pub mod shorts;
