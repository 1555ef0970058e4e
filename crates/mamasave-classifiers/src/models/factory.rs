use crate::config::ClassifierSpec;
use crate::error::ArtifactError;
use crate::models::classifier_trait::ClassifierModel;

/// Boxed classifier that can be shared across request handlers.
pub type SharedClassifier = Box<dyn ClassifierModel + Send + Sync>;

/// Validate a persisted classifier and build the matching model.
///
/// `n_features` is the input width every model must accept.
pub fn build_model(spec: ClassifierSpec, n_features: usize) -> Result<SharedClassifier, ArtifactError> {
    let model: SharedClassifier = match spec {
        ClassifierSpec::SoftmaxRegression(params) => Box::new(
            crate::models::softmax::SoftmaxRegression::new(params, n_features)?,
        ),
        ClassifierSpec::GaussianNb(params) => Box::new(
            crate::models::naive_bayes::GaussianNb::new(params, n_features)?,
        ),
        ClassifierSpec::RandomForest(params) => Box::new(
            crate::models::forest::RandomForest::new(params, n_features)?,
        ),
    };
    log::debug!(
        "Built {} classifier with {} classes",
        model.name(),
        model.n_classes()
    );
    Ok(model)
}
