pub mod classifier_trait;
pub mod factory;
pub mod forest;
pub mod naive_bayes;
pub mod softmax;
