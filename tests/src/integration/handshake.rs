//! # Handshake Integration Tests
//!
//! Challenge-response login against the in-process cluster: session binding,
//! freshness, reconnect re-authentication, and fatal configuration.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::{test_identity, trusted_cluster};
    use cluster_client::{InMemoryCluster, LoginRequest, Transport, TransportError};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;
    use validator_node::{
        Authenticator, ConfigError, IdentityConfig, ValidatorConfig, WireValidator,
    };
    use wire_crypto::{Challenge, NodeIdentity};

    #[tokio::test]
    async fn test_login_accepted_for_trusted_key() {
        let cluster = trusted_cluster();
        cluster.connect().await.unwrap();

        let authenticator = Authenticator::new(Arc::new(test_identity()));
        authenticator.authenticate(cluster.as_ref()).await.unwrap();

        assert!(cluster.authenticated());
    }

    #[tokio::test]
    async fn test_login_rejected_for_untrusted_key() {
        // Cluster trusts nobody.
        let cluster = Arc::new(InMemoryCluster::new());
        cluster.connect().await.unwrap();

        let authenticator = Authenticator::new(Arc::new(test_identity()));
        let err = authenticator.authenticate(cluster.as_ref()).await;

        assert!(err.is_err());
        assert!(!cluster.authenticated());
    }

    #[tokio::test]
    async fn test_login_rejected_for_foreign_session_challenge() {
        let cluster = trusted_cluster();
        cluster.connect().await.unwrap();

        // Proof over a challenge minted for some other session.
        let identity = test_identity();
        let challenge = Challenge::issue(&wire_types::SessionId::new("other-session"));
        let proof = identity.sign(&challenge);

        let result = cluster
            .login(LoginRequest {
                public_key: identity.public_key(),
                challenge,
                proof,
            })
            .await;

        assert!(matches!(result, Err(TransportError::LoginRejected(_))));
        assert!(!cluster.authenticated());
    }

    #[tokio::test]
    async fn test_reconnect_reassigns_session_and_reauthenticates() {
        let cluster = trusted_cluster();
        cluster.connect().await.unwrap();
        let first_session = cluster.session_id().unwrap();

        let authenticator = Authenticator::new(Arc::new(test_identity()));
        authenticator.authenticate(cluster.as_ref()).await.unwrap();

        // Connection drop invalidates both session and auth state.
        cluster.drop_connection("network partition");
        assert!(!cluster.authenticated());

        cluster.connect().await.unwrap();
        let second_session = cluster.session_id().unwrap();
        assert_ne!(first_session.as_str(), second_session.as_str());

        // The handshake binds to the new session without protocol changes.
        authenticator.authenticate(cluster.as_ref()).await.unwrap();
        assert!(cluster.authenticated());
    }

    #[tokio::test]
    async fn test_missing_credentials_fails_construction() {
        let cluster = trusted_cluster();
        let engine = Arc::new(suppressor::StructuralSuppressor::new());

        let err = WireValidator::new(
            &ValidatorConfig::default(),
            cluster.clone() as Arc<dyn Transport>,
            engine as Arc<dyn suppressor::Suppressor>,
        )
        .unwrap_err();

        assert_eq!(err, ConfigError::MissingCredentials);
        // Nothing was subscribed before the failure.
        assert_eq!(cluster.subscriber_count(wire_types::GET_CHANNEL), 0);
        assert_eq!(cluster.subscriber_count(wire_types::PUT_CHANNEL), 0);
    }

    #[tokio::test]
    async fn test_mismatched_keypair_fails_construction() {
        let seed = [0x5Au8; 32];
        let other = NodeIdentity::from_seed([0x77u8; 32]);
        let config = ValidatorConfig {
            identity: IdentityConfig {
                public_key_hex: Some(other.public_key().to_hex()),
                secret_seed_hex: Some(hex::encode(seed)),
            },
            ..Default::default()
        };

        let cluster = trusted_cluster();
        let engine = Arc::new(suppressor::StructuralSuppressor::new());
        let err = WireValidator::new(
            &config,
            cluster as Arc<dyn Transport>,
            engine as Arc<dyn suppressor::Suppressor>,
        )
        .unwrap_err();

        assert_eq!(err, ConfigError::KeyMismatch);
    }

    #[tokio::test]
    async fn test_wait_for_auth_subscription_blocks_until_login() {
        let cluster = trusted_cluster();
        cluster.connect().await.unwrap();

        let gated = Arc::clone(&cluster);
        let handle = tokio::spawn(async move {
            gated
                .subscribe("graph/get", cluster_client::SubscribeOptions::wait_for_auth())
                .await
        });

        // Not yet authenticated: the subscribe must still be pending.
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!handle.is_finished());

        let authenticator = Authenticator::new(Arc::new(test_identity()));
        authenticator.authenticate(cluster.as_ref()).await.unwrap();

        let subscription = timeout(Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(subscription.channel(), "graph/get");
    }
}
