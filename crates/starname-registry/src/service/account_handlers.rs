//! Account message handlers.

use super::{validated, MsgContext};
use crate::adapters::WriteSet;
use crate::domain::{
    Account, AccountController, DomainController, DomainType, MsgAddAccountCertificate,
    MsgDeleteAccount, MsgDeleteAccountCertificate, MsgRegisterAccount, MsgRenewAccount,
    MsgReplaceAccountMetadata, MsgReplaceAccountResources, MsgTransferAccount, RegistryError,
    MAX_VALID_UNTIL,
};
use crate::events::{MsgOutcome, RegistryEvent};
use crate::executor::{AccountExecutor, DomainExecutor};
use crate::ports::outbound::{FeeSink, RegistryStore};

/// Domain `MustExist, NotExpired` then an account controller over it.
///
/// Most account operations start this way.
fn live_account<'a, 'b, S, F>(
    ctx: &'a MsgContext<'b, S, F>,
    domain: &str,
    name: &str,
) -> Result<AccountController<'a, WriteSet<'b, S>>, RegistryError>
where
    S: RegistryStore + ?Sized,
    F: FeeSink + ?Sized,
{
    let mut domain_ctrl = DomainController::new(&ctx.store, domain, ctx.now).with_config(ctx.config);
    domain_ctrl.must_exist().not_expired().validate()?;
    Ok(AccountController::new(&ctx.store, domain, name, ctx.now)
        .with_config(ctx.config)
        .with_domain_controller(domain_ctrl))
}

pub(crate) fn register_account<S, F>(
    ctx: &mut MsgContext<'_, S, F>,
    msg: MsgRegisterAccount,
) -> Result<MsgOutcome, RegistryError>
where
    S: RegistryStore + ?Sized,
    F: FeeSink + ?Sized,
{
    let mut ctrl = live_account(ctx, &msg.domain, &msg.name)?;
    ctrl.must_not_exist()
        .valid_name()
        .valid_resources(&msg.resources)
        .resource_limit_not_exceeded(&msg.resources)
        .registrable_by(msg.registerer)
        .validate()?;
    let domain = ctrl.domain().clone();

    let valid_until = match domain.domain_type {
        DomainType::Closed => MAX_VALID_UNTIL,
        DomainType::Open => ctx.now.saturating_add(ctx.config.account_renewal_period),
    };
    let mut account = Account::new(&msg.domain, &msg.name, msg.owner, valid_until);
    account.broker = msg.broker;
    account.resources = msg.resources.clone();

    let fee = ctx.charge(&domain)?;
    AccountExecutor::new(&mut ctx.store, account).create()?;

    Ok(MsgOutcome {
        fee,
        event: RegistryEvent::AccountRegistered {
            domain: msg.domain,
            name: msg.name,
            owner: msg.owner,
            registerer: msg.registerer,
            broker: msg.broker,
            resources: msg.resources,
        },
    })
}

/// Renewing an account past the domain's grace window pulls the domain
/// expiry forward to the account's.
pub(crate) fn renew_account<S, F>(
    ctx: &mut MsgContext<'_, S, F>,
    msg: MsgRenewAccount,
) -> Result<MsgOutcome, RegistryError>
where
    S: RegistryStore + ?Sized,
    F: FeeSink + ?Sized,
{
    let mut domain_ctrl =
        DomainController::new(&ctx.store, &msg.domain, ctx.now).with_config(ctx.config);
    domain_ctrl
        .must_exist()
        .domain_type(DomainType::Open)
        .validate()?;
    let mut ctrl = AccountController::new(&ctx.store, &msg.domain, &msg.name, ctx.now)
        .with_config(ctx.config)
        .with_domain_controller(domain_ctrl);
    ctrl.must_exist().renewable().validate()?;
    let (account, domain) = validated(ctrl);

    let fee = ctx.charge(&domain)?;

    let mut executor = AccountExecutor::new(&mut ctx.store, account).with_config(ctx.config);
    executor.renew()?;
    let renewed_until = executor.state().valid_until;

    let grace_until = domain
        .valid_until
        .saturating_add(ctx.config.domain_grace_period);
    if renewed_until > grace_until {
        DomainExecutor::new(&mut ctx.store, domain).renew(Some(renewed_until))?;
    }

    Ok(MsgOutcome {
        fee,
        event: RegistryEvent::AccountRenewed {
            domain: msg.domain,
            name: msg.name,
            owner: msg.signer,
        },
    })
}

pub(crate) fn delete_account<S, F>(
    ctx: &mut MsgContext<'_, S, F>,
    msg: MsgDeleteAccount,
) -> Result<MsgOutcome, RegistryError>
where
    S: RegistryStore + ?Sized,
    F: FeeSink + ?Sized,
{
    let mut domain_ctrl =
        DomainController::new(&ctx.store, &msg.domain, ctx.now).with_config(ctx.config);
    domain_ctrl.must_exist().validate()?;
    let mut ctrl = AccountController::new(&ctx.store, &msg.domain, &msg.name, ctx.now)
        .with_config(ctx.config)
        .with_domain_controller(domain_ctrl);
    ctrl.must_exist().deletable_by(msg.owner).validate()?;
    let (account, domain) = validated(ctrl);

    let fee = ctx.charge(&domain)?;
    AccountExecutor::new(&mut ctx.store, account).delete()?;

    Ok(MsgOutcome {
        fee,
        event: RegistryEvent::AccountDeleted {
            domain: msg.domain,
            name: msg.name,
            owner: msg.owner,
        },
    })
}

pub(crate) fn transfer_account<S, F>(
    ctx: &mut MsgContext<'_, S, F>,
    msg: MsgTransferAccount,
) -> Result<MsgOutcome, RegistryError>
where
    S: RegistryStore + ?Sized,
    F: FeeSink + ?Sized,
{
    let mut ctrl = live_account(ctx, &msg.domain, &msg.name)?;
    ctrl.must_exist()
        .not_expired()
        .transferable_by(msg.owner)
        .resettable_by(msg.owner, msg.reset)
        .validate()?;
    let (account, domain) = validated(ctrl);

    let fee = ctx.charge(&domain)?;
    AccountExecutor::new(&mut ctx.store, account).transfer(msg.new_owner, msg.reset)?;

    Ok(MsgOutcome {
        fee,
        event: RegistryEvent::AccountTransferred {
            domain: msg.domain,
            name: msg.name,
            owner: msg.owner,
            new_owner: msg.new_owner,
            reset: msg.reset,
        },
    })
}

pub(crate) fn replace_account_resources<S, F>(
    ctx: &mut MsgContext<'_, S, F>,
    msg: MsgReplaceAccountResources,
) -> Result<MsgOutcome, RegistryError>
where
    S: RegistryStore + ?Sized,
    F: FeeSink + ?Sized,
{
    let mut ctrl = live_account(ctx, &msg.domain, &msg.name)?;
    ctrl.must_exist()
        .not_expired()
        .owned_by(msg.owner)
        .valid_resources(&msg.new_resources)
        .resource_limit_not_exceeded(&msg.new_resources)
        .validate()?;
    let (account, domain) = validated(ctrl);

    let fee = ctx.charge(&domain)?;
    AccountExecutor::new(&mut ctx.store, account).replace_resources(msg.new_resources.clone())?;

    Ok(MsgOutcome {
        fee,
        event: RegistryEvent::AccountResourcesReplaced {
            domain: msg.domain,
            name: msg.name,
            owner: msg.owner,
            resources: msg.new_resources,
        },
    })
}

pub(crate) fn add_account_certificate<S, F>(
    ctx: &mut MsgContext<'_, S, F>,
    msg: MsgAddAccountCertificate,
) -> Result<MsgOutcome, RegistryError>
where
    S: RegistryStore + ?Sized,
    F: FeeSink + ?Sized,
{
    let mut ctrl = live_account(ctx, &msg.domain, &msg.name)?;
    ctrl.must_exist()
        .not_expired()
        .owned_by(msg.owner)
        .certificate_limit_not_exceeded()
        .certificate_size_not_exceeded(&msg.new_certificate)
        .certificate_not_exist(&msg.new_certificate)
        .validate()?;
    let (account, domain) = validated(ctrl);

    let fee = ctx.charge(&domain)?;
    AccountExecutor::new(&mut ctx.store, account).add_certificate(msg.new_certificate.clone())?;

    Ok(MsgOutcome {
        fee,
        event: RegistryEvent::AccountCertificateAdded {
            domain: msg.domain,
            name: msg.name,
            owner: msg.owner,
            certificate: msg.new_certificate,
        },
    })
}

pub(crate) fn delete_account_certificate<S, F>(
    ctx: &mut MsgContext<'_, S, F>,
    msg: MsgDeleteAccountCertificate,
) -> Result<MsgOutcome, RegistryError>
where
    S: RegistryStore + ?Sized,
    F: FeeSink + ?Sized,
{
    let mut ctrl = live_account(ctx, &msg.domain, &msg.name)?;
    ctrl.must_exist()
        .not_expired()
        .owned_by(msg.owner)
        .certificate_exists(&msg.delete_certificate)
        .validate()?;
    let index = ctrl.certificate_index();
    let (account, domain) = validated(ctrl);

    let fee = ctx.charge(&domain)?;
    AccountExecutor::new(&mut ctx.store, account).delete_certificate(index)?;

    Ok(MsgOutcome {
        fee,
        event: RegistryEvent::AccountCertificateDeleted {
            domain: msg.domain,
            name: msg.name,
            owner: msg.owner,
            certificate: msg.delete_certificate,
        },
    })
}

pub(crate) fn replace_account_metadata<S, F>(
    ctx: &mut MsgContext<'_, S, F>,
    msg: MsgReplaceAccountMetadata,
) -> Result<MsgOutcome, RegistryError>
where
    S: RegistryStore + ?Sized,
    F: FeeSink + ?Sized,
{
    let mut ctrl = live_account(ctx, &msg.domain, &msg.name)?;
    ctrl.must_exist()
        .not_expired()
        .owned_by(msg.owner)
        .metadata_size_not_exceeded(&msg.new_metadata_uri)
        .validate()?;
    let (account, domain) = validated(ctrl);

    let fee = ctx.charge(&domain)?;
    AccountExecutor::new(&mut ctx.store, account).update_metadata(msg.new_metadata_uri.clone())?;

    Ok(MsgOutcome {
        fee,
        event: RegistryEvent::AccountMetadataReplaced {
            domain: msg.domain,
            name: msg.name,
            owner: msg.owner,
            metadata_uri: msg.new_metadata_uri,
        },
    })
}
