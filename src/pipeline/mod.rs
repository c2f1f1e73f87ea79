// The batch pipeline — normalize, assign, classify, score, fuse.

pub mod run;
