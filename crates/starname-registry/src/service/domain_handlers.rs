//! Domain message handlers.

use super::MsgContext;
use crate::domain::{
    Domain, DomainController, MsgDeleteDomain, MsgRegisterDomain, MsgRenewDomain,
    MsgTransferDomain, RegistryError,
};
use crate::events::{MsgOutcome, RegistryEvent};
use crate::executor::DomainExecutor;
use crate::ports::outbound::{FeeSink, RegistryStore};

pub(crate) fn register_domain<S, F>(
    ctx: &mut MsgContext<'_, S, F>,
    msg: MsgRegisterDomain,
) -> Result<MsgOutcome, RegistryError>
where
    S: RegistryStore + ?Sized,
    F: FeeSink + ?Sized,
{
    DomainController::new(&ctx.store, &msg.name, ctx.now)
        .with_config(ctx.config)
        .must_not_exist()
        .valid_name()
        .validate()?;

    let valid_until = ctx.now.saturating_add(ctx.config.domain_renewal_period);
    let mut domain = Domain::new(&msg.name, msg.admin, valid_until, msg.domain_type);
    domain.broker = msg.broker;

    let fee = ctx.charge(&domain)?;
    DomainExecutor::new(&mut ctx.store, domain).create()?;

    Ok(MsgOutcome {
        fee,
        event: RegistryEvent::DomainRegistered {
            domain: msg.name,
            domain_type: msg.domain_type,
            owner: msg.admin,
            broker: msg.broker,
        },
    })
}

pub(crate) fn renew_domain<S, F>(
    ctx: &mut MsgContext<'_, S, F>,
    msg: MsgRenewDomain,
) -> Result<MsgOutcome, RegistryError>
where
    S: RegistryStore + ?Sized,
    F: FeeSink + ?Sized,
{
    let mut ctrl = DomainController::new(&ctx.store, &msg.domain, ctx.now).with_config(ctx.config);
    ctrl.must_exist().renewable().validate()?;
    let domain = ctrl.into_domain();

    let fee = ctx.charge(&domain)?;
    DomainExecutor::new(&mut ctx.store, domain)
        .with_config(ctx.config)
        .renew(None)?;

    Ok(MsgOutcome {
        fee,
        event: RegistryEvent::DomainRenewed {
            domain: msg.domain,
            owner: msg.signer,
        },
    })
}

pub(crate) fn delete_domain<S, F>(
    ctx: &mut MsgContext<'_, S, F>,
    msg: MsgDeleteDomain,
) -> Result<MsgOutcome, RegistryError>
where
    S: RegistryStore + ?Sized,
    F: FeeSink + ?Sized,
{
    let mut ctrl = DomainController::new(&ctx.store, &msg.domain, ctx.now).with_config(ctx.config);
    ctrl.must_exist().deletable_by(msg.owner).validate()?;
    let domain = ctrl.into_domain();

    let fee = ctx.charge(&domain)?;
    DomainExecutor::new(&mut ctx.store, domain).delete()?;

    Ok(MsgOutcome {
        fee,
        event: RegistryEvent::DomainDeleted {
            domain: msg.domain,
            owner: msg.owner,
        },
    })
}

pub(crate) fn transfer_domain<S, F>(
    ctx: &mut MsgContext<'_, S, F>,
    msg: MsgTransferDomain,
) -> Result<MsgOutcome, RegistryError>
where
    S: RegistryStore + ?Sized,
    F: FeeSink + ?Sized,
{
    let mut ctrl = DomainController::new(&ctx.store, &msg.domain, ctx.now).with_config(ctx.config);
    ctrl.must_exist()
        .not_expired()
        .admin(msg.owner)
        .transferable(msg.transfer_flag)
        .validate()?;
    let domain = ctrl.into_domain();

    let fee = ctx.charge(&domain)?;
    DomainExecutor::new(&mut ctx.store, domain).transfer(msg.transfer_flag, msg.new_admin)?;

    Ok(MsgOutcome {
        fee,
        event: RegistryEvent::DomainTransferred {
            domain: msg.domain,
            owner: msg.owner,
            new_owner: msg.new_admin,
            flag: msg.transfer_flag,
        },
    })
}
