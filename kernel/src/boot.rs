//! AArch64 entry point
//!
//! The GPU firmware loads `kernel8.img` at 0x80000 and starts all four
//! cores there. Core 0 gets a stack just below the image, clears BSS and
//! calls `kernel_main`; the other cores park.

use core::arch::global_asm;

global_asm!(
    r#"
.section .text.boot
.global _start

_start:
    mrs     x0, mpidr_el1
    and     x0, x0, #0xFF
    cbnz    x0, .Lpark

    ldr     x1, =_start
    mov     sp, x1

    ldr     x0, =__bss_start
    ldr     x1, =__bss_end
.Lclear_bss:
    cmp     x0, x1
    b.hs    .Lbss_done
    str     xzr, [x0], #8
    b       .Lclear_bss
.Lbss_done:

    bl      kernel_main

.Lpark:
    wfe
    b       .Lpark
"#
);
