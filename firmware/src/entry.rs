use core::arch::global_asm;

// Exception vectors (ATCM at 0x0) and the reset path up to the first Rust call.
//
// Every trap vector saves the caller-saved registers on the current mode's stack and calls
// `trap_dispatch(kind)`. Kind numbers match `firmware_lib::vectors::TrapKind`.
global_asm!(
    r#"
    .section .vectors, "ax"
    .arm
    .global _vectors
_vectors:
    ldr     pc, .Lreset_addr
    ldr     pc, .Lundef_addr
    ldr     pc, .Lsvc_addr
    ldr     pc, .Lpabt_addr
    ldr     pc, .Ldabt_addr
    b       .                       /* reserved */
    ldr     pc, .Lirq_addr
    ldr     pc, .Lfiq_addr

.Lreset_addr: .word _reset
.Lundef_addr: .word _undef_entry
.Lsvc_addr:   .word _svc_entry
.Lpabt_addr:  .word _pabt_entry
.Ldabt_addr:  .word _dabt_entry
.Lirq_addr:   .word _irq_entry
.Lfiq_addr:   .word _fiq_entry

    .section .text.reset, "ax"
    .arm
    .global _reset
    .type _reset, %function
_reset:
    cpsid   if

    /* One stack per exception mode, SVC last so Rust runs on the main stack */
    cps     #0x11                   /* FIQ */
    ldr     sp, =__fiq_stack_end__
    cps     #0x12                   /* IRQ */
    ldr     sp, =__irq_stack_end__
    cps     #0x17                   /* ABT */
    ldr     sp, =__abt_stack_end__
    cps     #0x1B                   /* UND */
    ldr     sp, =__und_stack_end__
    cps     #0x13                   /* SVC */
    ldr     sp, =__stack_end__

    /* Grant CP10/CP11 access and turn the VFP on; hard-float code may touch it anywhere */
    mrc     p15, 0, r0, c1, c0, 2
    orr     r0, r0, #(0xF << 20)
    mcr     p15, 0, r0, c1, c0, 2
    isb
    mov     r0, #0x40000000
    vmsr    fpexc, r0

    bl      reset_handler

    /* reset_handler does not return */
1:
    wfi
    b       1b
    .ltorg

    .macro trap_stub name, kind, lr_adjust
    .section .text.\name, "ax"
    .arm
    .global \name
\name:
    sub     lr, lr, #\lr_adjust
    push    {{r0-r3, r12, lr}}
    mov     r0, #\kind
    bl      trap_dispatch
    pop     {{r0-r3, r12, lr}}
    movs    pc, lr
    .endm

    trap_stub _undef_entry, 0, 0
    trap_stub _svc_entry,   1, 0
    trap_stub _pabt_entry,  2, 4
    trap_stub _dabt_entry,  3, 8
    trap_stub _irq_entry,   4, 4
    trap_stub _fiq_entry,   5, 4
"#
);
