use std::time::Instant;

use uuid::Uuid;

use rapido_api::domain::types::User;
use rapido_api::error::ApiError;
use rapido_api::infra::password::PasswordHasher;
use rapido_api::usecase::auth::{
    AuthenticateUseCase, LoginInput, LoginUseCase, SignupInput, SignupUseCase, TokenSettings,
    issue_access_token, validate_token,
};
use rapido_domain::user::UserRole;

use crate::helpers::{MockUserRepo, TEST_JWT_SECRET, test_hasher, test_tokens, test_user};

fn signup_input(username: &str, email: &str) -> SignupInput {
    SignupInput {
        username: username.into(),
        email: email.into(),
        password: "secret123".into(),
        full_name: Some("Test Rider".into()),
        phone_number: Some("9876543210".into()),
        role: None,
    }
}

async fn signup(repo: &MockUserRepo, input: SignupInput) -> Result<User, ApiError> {
    SignupUseCase {
        repo: repo.clone(),
        hasher: test_hasher(),
    }
    .execute(input)
    .await
}

// ── Signup ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_sign_up_user_with_normalized_email_and_hashed_password() {
    let repo = MockUserRepo::default();
    let user = signup(&repo, signup_input("rider", "  Rider@Example.COM "))
        .await
        .unwrap();

    assert_eq!(user.email, "rider@example.com");
    assert_eq!(user.role, UserRole::User);
    assert_ne!(user.password_hash, "secret123");
    assert!(bcrypt::verify("secret123", &user.password_hash).unwrap());
    assert_eq!(repo.len(), 1);
}

#[tokio::test]
async fn should_allow_admin_signup_when_requested() {
    let repo = MockUserRepo::default();
    let mut input = signup_input("boss", "boss@example.com");
    input.role = Some("admin".into());
    let user = signup(&repo, input).await.unwrap();
    assert_eq!(user.role, UserRole::Admin);
}

#[tokio::test]
async fn should_reject_duplicate_email_or_username() {
    let repo = MockUserRepo::default();
    signup(&repo, signup_input("rider", "rider@example.com"))
        .await
        .unwrap();

    let same_email = signup(&repo, signup_input("other", "RIDER@example.com")).await;
    assert!(matches!(same_email, Err(ApiError::UserAlreadyExists)));

    let same_username = signup(&repo, signup_input("rider", "fresh@example.com")).await;
    assert!(matches!(same_username, Err(ApiError::UserAlreadyExists)));
    assert_eq!(repo.len(), 1);
}

#[tokio::test]
async fn should_reject_invalid_signup_input() {
    let repo = MockUserRepo::default();

    let mut short_password = signup_input("a", "a@example.com");
    short_password.password = "12345".into();
    let mut bad_role = signup_input("b", "b@example.com");
    bad_role.role = Some("driver".into());
    let mut long_phone = signup_input("c", "c@example.com");
    long_phone.phone_number = Some("1".repeat(21));

    for input in [
        signup_input("", "x@example.com"),
        signup_input("x", "not-an-email"),
        short_password,
        bad_role,
        long_phone,
    ] {
        let result = signup(&repo, input).await;
        assert!(
            matches!(result, Err(ApiError::InvalidInput(_))),
            "expected InvalidInput, got {result:?}"
        );
    }
    assert_eq!(repo.len(), 0);
}

// ── Login ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_issue_token_that_resolves_to_the_same_user() {
    let repo = MockUserRepo::default();
    let mut input = signup_input("boss", "boss@example.com");
    input.role = Some("admin".into());
    let created = signup(&repo, input).await.unwrap();

    let output = LoginUseCase {
        repo: repo.clone(),
        hasher: test_hasher(),
        tokens: test_tokens(),
    }
    .execute(LoginInput {
        email: "Boss@Example.com".into(),
        password: "secret123".into(),
    })
    .await
    .unwrap();

    assert_eq!(output.user.id, created.id);
    let claims = validate_token(&output.access_token, TEST_JWT_SECRET).unwrap();
    assert_eq!(claims.sub, created.id.to_string());
    assert_eq!(claims.role, UserRole::Admin);
    assert_eq!(claims.exp, output.access_token_exp);

    let resolved = AuthenticateUseCase {
        repo: repo.clone(),
        tokens: test_tokens(),
    }
    .execute(&output.access_token)
    .await
    .unwrap();
    assert_eq!(resolved.id, created.id);
    assert_eq!(resolved.role, UserRole::Admin);
}

#[tokio::test]
async fn should_fail_login_with_same_error_for_wrong_password_or_unknown_email() {
    let repo = MockUserRepo::default();
    signup(&repo, signup_input("rider", "rider@example.com"))
        .await
        .unwrap();
    let usecase = LoginUseCase {
        repo,
        hasher: test_hasher(),
        tokens: test_tokens(),
    };

    let wrong_password = usecase
        .execute(LoginInput {
            email: "rider@example.com".into(),
            password: "secret124".into(),
        })
        .await;
    assert!(matches!(wrong_password, Err(ApiError::InvalidCredentials)));

    let unknown_email = usecase
        .execute(LoginInput {
            email: "ghost@example.com".into(),
            password: "secret123".into(),
        })
        .await;
    assert!(matches!(unknown_email, Err(ApiError::InvalidCredentials)));
}

#[tokio::test]
async fn should_reject_malformed_email_as_invalid_credentials() {
    let repo = MockUserRepo::default();
    signup(&repo, signup_input("rider", "rider@example.com"))
        .await
        .unwrap();

    for email in ["not-an-email", "  ", "rider@@example.com"] {
        let result = LoginUseCase {
            repo: repo.clone(),
            hasher: test_hasher(),
            tokens: test_tokens(),
        }
        .execute(LoginInput {
            email: email.into(),
            password: "wrong-password".into(),
        })
        .await;
        assert!(
            matches!(result, Err(ApiError::InvalidCredentials)),
            "{email:?}: got {result:?}"
        );
    }
}

#[tokio::test]
async fn should_spend_hash_work_when_email_is_unknown() {
    let hasher = PasswordHasher::new(10);
    let started = Instant::now();
    hasher.hash("secret123").await.unwrap();
    let one_hash = started.elapsed();

    let usecase = LoginUseCase {
        repo: MockUserRepo::default(),
        hasher,
        tokens: test_tokens(),
    };
    let started = Instant::now();
    let result = usecase
        .execute(LoginInput {
            email: "ghost@example.com".into(),
            password: "secret123".into(),
        })
        .await;
    let miss = started.elapsed();

    assert!(matches!(result, Err(ApiError::InvalidCredentials)));
    assert!(miss * 4 >= one_hash, "miss took {miss:?}, one hash {one_hash:?}");
}

// ── Authenticate ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_take_role_from_store_not_token() {
    let admin = test_user("demoted", UserRole::Admin);
    let repo = MockUserRepo::with_users(vec![admin.clone()]);
    let (token, _) = issue_access_token(&admin, &test_tokens()).unwrap();

    repo.set_role(admin.id, UserRole::User);

    let user = AuthenticateUseCase {
        repo,
        tokens: test_tokens(),
    }
    .execute(&token)
    .await
    .unwrap();
    assert_eq!(user.role, UserRole::User);
}

#[tokio::test]
async fn should_reject_token_for_unknown_user() {
    let ghost = test_user("ghost", UserRole::User);
    let (token, _) = issue_access_token(&ghost, &test_tokens()).unwrap();

    let result = AuthenticateUseCase {
        repo: MockUserRepo::default(),
        tokens: test_tokens(),
    }
    .execute(&token)
    .await;
    assert!(matches!(result, Err(ApiError::Unauthorized)));
}

#[tokio::test]
async fn should_accept_raw_user_id_only_when_enabled() {
    let rider = test_user("rider", UserRole::User);
    let repo = MockUserRepo::with_users(vec![rider.clone()]);
    let raw = rider.id.to_string();

    let strict = AuthenticateUseCase {
        repo: repo.clone(),
        tokens: test_tokens(),
    };
    assert!(matches!(
        strict.execute(&raw).await,
        Err(ApiError::Unauthorized)
    ));

    let legacy = AuthenticateUseCase {
        repo,
        tokens: TokenSettings {
            accept_user_id: true,
            ..test_tokens()
        },
    };
    assert_eq!(legacy.execute(&raw).await.unwrap().id, rider.id);
    assert!(matches!(
        legacy.execute(&Uuid::now_v7().to_string()).await,
        Err(ApiError::Unauthorized)
    ));
    assert!(matches!(
        legacy.execute("not-a-token").await,
        Err(ApiError::Unauthorized)
    ));
}
